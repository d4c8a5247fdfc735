//! Restaurant domain core.
//!
//! Entity extents, bidirectional relationship maintenance and per-kind
//! snapshot persistence. Everything operates on an explicit [`Registry`];
//! there is no process-wide entity state.

pub mod extent;
pub mod logging;
pub mod model;
pub mod persist;
pub mod relation;
pub mod service;

pub use extent::{Entity, EntityRef, Extent, HasExtent, Registry};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::customer::{Customer, CustomerId, Membership};
pub use model::dish::{Dish, DishId};
pub use model::menu::{Menu, MenuId};
pub use model::order::{Order, OrderId, OrderLine};
pub use model::payment::{Payment, PaymentId, PaymentMethod, PaymentStatus};
pub use model::reservation::{Reservation, ReservationId};
pub use model::restaurant::{Restaurant, RestaurantId};
pub use model::staff::{
    parse_staff_capability, Employee, EmployeeId, ManagerLevel, StaffCapability,
    StaffCapabilityError, StaffRole,
};
pub use model::table::{Table, TableId};
pub use model::valet::{Valet, ValetId};
pub use model::{EntityId, ValidationError};
pub use persist::{
    ExtentFormat, ExtentMetadata, ExtentStore, LoadOutcome, LoadStatus, PersistError,
    PersistResult, StoreConfig,
};
pub use relation::{
    audit, DeclineReason, IntegrityViolation, LinkOutcome, RelationError, RelationResult,
    RemovalPolicy, ReservationOutcome,
};
pub use service::extent_service::{
    ExtentReport, ExtentService, KindReport, LoadReport, SaveReport, SaveStatus,
    PERSISTED_KINDS,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
