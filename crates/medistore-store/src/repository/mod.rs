//! # Repositories
//!
//! One repository per collection. Each borrows the [`PharmacyStore`] and
//! applies business rules from `medistore-core` before writing.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  InventoryLedger     tolerant delta-adjust of medicine stock           │
//! │  MedicineRepository  add/update/delete + stock reports                 │
//! │  SaleRepository      record_sale + medicine-referencing queries        │
//! │  RefundEngine        validate → compute → append → restore stock       │
//! │  UdharRepository     credit records, paid/unpaid transitions           │
//! │  UserRepository      advisory user list                                │
//! │  SettingsRepository  singleton configuration                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod inventory;
pub mod medicine;
pub mod refund;
pub mod sale;
pub mod settings;
pub mod udhar;
pub mod user;
