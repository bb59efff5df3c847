//! # Seed Data Generator
//!
//! Populates a data directory with sample medicines for development.
//!
//! ## Usage
//! ```bash
//! # Seed into ./medistore_data (default)
//! cargo run -p medistore-store --bin seed
//!
//! # Specify data directory
//! cargo run -p medistore-store --bin seed -- --dir ./data
//! ```
//!
//! Each medicine gets a random stock level and a batch expiry spread over
//! the next two years, so the low-stock and expiry reports have something
//! to show right away.

use chrono::{Duration, Utc};
use rand::Rng;
use std::env;

use medistore_store::{JsonFileBackend, NewMedicine, Pharmacy};

/// (name, company, category, cost cents, sale cents)
const MEDICINES: &[(&str, &str, &str, i64, i64)] = &[
    ("Panadol 500mg", "GSK", "Tablet", 1200, 1800),
    ("Panadol Extra", "GSK", "Tablet", 1800, 2500),
    ("Brufen 400mg", "Abbott", "Tablet", 1500, 2200),
    ("Augmentin 625mg", "GSK", "Antibiotic", 28000, 35000),
    ("Amoxil 500mg", "GSK", "Antibiotic", 12000, 16000),
    ("Flagyl 400mg", "Sanofi", "Antibiotic", 5000, 7500),
    ("Ponstan Forte", "Pfizer", "Tablet", 4000, 6000),
    ("Risek 20mg", "Getz Pharma", "Capsule", 18000, 24000),
    ("Nexum 40mg", "Getz Pharma", "Capsule", 22000, 28500),
    ("Softin 10mg", "Getz Pharma", "Tablet", 8000, 11000),
    ("Arinac Forte", "Abbott", "Tablet", 3500, 5000),
    ("Disprin", "Reckitt", "Tablet", 800, 1200),
    ("Calpol Syrup 120ml", "GSK", "Syrup", 9000, 12500),
    ("Brufen Syrup 100ml", "Abbott", "Syrup", 7500, 10500),
    ("Hydryllin Syrup", "Searle", "Syrup", 11000, 15000),
    ("Ventolin Inhaler", "GSK", "Inhaler", 32000, 42000),
    ("Polyfax Ointment", "GSK", "Ointment", 6000, 9000),
    ("Dettol 250ml", "Reckitt", "Antiseptic", 21000, 27500),
    ("ORS Sachet", "Searle", "Sachet", 1500, 2500),
    ("Surbex-Z", "Abbott", "Multivitamin", 25000, 32000),
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut dir = String::from("./medistore_data");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--dir" | "-d" => {
                if i + 1 < args.len() {
                    dir = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("MediStore Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --dir <PATH>   Data directory (default: ./medistore_data)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    println!("🌱 MediStore Seed Data Generator");
    println!("================================");
    println!("Data directory: {}", dir);
    println!();

    let pharmacy = Pharmacy::new(JsonFileBackend::new(&dir)?);

    let existing = pharmacy.medicines().all()?.len();
    if existing > 0 {
        println!("⚠ Directory already has {} medicines", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the data files to regenerate.");
        return Ok(());
    }

    // Persist the defaults so the settings file exists on disk
    let settings = pharmacy.settings().get()?;
    pharmacy.settings().save(&settings)?;
    println!("✓ Settings written ({})", settings.shop_name);

    // Seed the default admin
    let users = pharmacy.users().all()?;
    println!("✓ Users seeded ({})", users[0].email);

    println!();
    println!("Generating medicines...");

    let mut rng = rand::thread_rng();
    let today = Utc::now().date_naive();
    let mut generated = 0;

    for (idx, (name, company, category, cost, sale)) in MEDICINES.iter().enumerate() {
        let new = NewMedicine {
            name: (*name).to_string(),
            company: (*company).to_string(),
            category: (*category).to_string(),
            cost_price_cents: *cost,
            sale_price_cents: *sale,
            stock: rng.gen_range(0..200),
            reorder_level: 25,
            expiry: today + Duration::days(rng.gen_range(10..730)),
            batch_number: format!("B-{:04}", idx + 1),
        };

        if let Err(e) = pharmacy.medicines().add(new) {
            eprintln!("Failed to insert {}: {}", name, e);
            continue;
        }
        generated += 1;
    }

    println!("✓ Generated {} medicines", generated);

    let low = pharmacy.medicines().low_stock()?.len();
    let expiring = pharmacy.medicines().expiring_soon(today)?.len();
    println!();
    println!("Reports: {} low on stock, {} expiring soon", low, expiring);
    println!();
    println!("✅ Seed complete!");

    Ok(())
}
