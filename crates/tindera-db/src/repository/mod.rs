//! # Repository Implementations
//!
//! Typed, validated wrappers over the raw document collections.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Repository Layer                                   │
//! │                                                                         │
//! │  Frontend form payload                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Repository (this module)                                               │
//! │  ├── validate with tindera-core rules (fail ⇒ nothing written)          │
//! │  ├── stamp timestamps                                                   │
//! │  └── delegate to Collection<T>                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  documents table                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each repository exposes only the operations its collection supports:
//! transactions, notably, have no update or delete.

pub mod expense;
pub mod product;
pub mod transaction;

pub use expense::ExpenseRepository;
pub use product::{ProductForm, ProductRepository};
pub use transaction::TransactionRepository;
