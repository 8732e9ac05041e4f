//! Data layer: the car table, loading, filtering and aggregation.
//!
//! Architecture:
//! ```text
//!   my_cars.csv
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse CSV → CarDataset
//!   └──────────┘
//!        │
//!        ▼
//!   ┌────────────┐
//!   │ CarDataset  │  Vec<CarRecord>, categorical domains (immutable)
//!   └────────────┘
//!        │  + FilterCriteria
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  AND of per-field predicates → FilteredView
//!   └──────────┘
//!        │
//!        ▼
//!   ┌─────────────────────────────┐
//!   │ aggregate / spread / summary │  grouped reductions (classify for
//!   └─────────────────────────────┘  engine & transmission buckets)
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ insights  │  every table the dashboard draws, all-or-nothing
//!   └──────────┘
//! ```

pub mod aggregate;
pub mod classify;
pub mod error;
pub mod filter;
pub mod insights;
pub mod loader;
pub mod model;
pub mod spread;
pub mod summary;
