//! # medistore-store: Record Store Layer for MediStore
//!
//! Persistence and orchestration for the pharmacy system: a pluggable
//! key-value storage port, typed whole-collection access, and the
//! repositories that implement sales, refunds, stock and credit on top.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       MediStore Data Flow                               │
//! │                                                                         │
//! │  Caller (UI page / CLI)                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 medistore-store (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌─────────────┐  │   │
//! │  │   │  Pharmacy     │    │  Repositories  │    │  Backends   │  │   │
//! │  │   │  (facade)     │───►│  sale, refund, │───►│  JSON file  │  │   │
//! │  │   │               │    │  medicine, ... │    │  in-memory  │  │   │
//! │  │   └───────────────┘    └────────────────┘    └─────────────┘  │   │
//! │  │                              │                                  │   │
//! │  │                              ▼                                  │   │
//! │  │                      medistore-core (pure math)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  One JSON document per collection (medicines, sales, refunds,          │
//! │  udhar, settings, users)                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`backend`] - `StorageBackend` trait + JSON file / in-memory backends
//! - [`store`] - Typed whole-collection load/save (`PharmacyStore`)
//! - [`repository`] - Sales, refunds, medicines, inventory, udhar, users,
//!   settings
//! - [`pharmacy`] - `Pharmacy` facade bundling the repositories
//! - [`error`] - Store error types
//!
//! ## Concurrency Model
//!
//! Strictly single-writer, synchronous. Every operation runs to completion
//! as load → mutate → save on whole collections. Two writers from separate
//! processes can lose updates (or over-refund a line); deployments beyond a
//! single terminal need a transactional backend behind the same trait.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use medistore_store::{backend::JsonFileBackend, Pharmacy};
//!
//! # fn main() -> Result<(), medistore_store::StoreError> {
//! let pharmacy = Pharmacy::new(JsonFileBackend::new("./medistore-data")?);
//! let low = pharmacy.medicines().low_stock()?;
//! println!("{} medicines need restocking", low.len());
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod backend;
pub mod error;
pub mod pharmacy;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use backend::{JsonFileBackend, MemoryBackend, StorageBackend};
pub use error::{StoreError, StoreResult};
pub use pharmacy::Pharmacy;
pub use store::PharmacyStore;

// Repository re-exports for convenience
pub use repository::inventory::InventoryLedger;
pub use repository::medicine::{MedicineRepository, NewMedicine};
pub use repository::refund::RefundEngine;
pub use repository::sale::{CustomerInfo, PaymentInfo, SaleRepository};
pub use repository::settings::SettingsRepository;
pub use repository::udhar::{NewUdhar, UdharRepository};
pub use repository::user::UserRepository;
