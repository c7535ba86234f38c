//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod agent;
pub mod availability_override;
pub mod company_allocation;
pub mod credit_package;
pub mod credit_transaction;
pub mod listing;
pub mod notification;
pub mod order;
pub mod order_service;
pub mod partner_payout;
pub mod payout_lock;
pub mod staff;
pub mod staff_payout;
pub mod time_off_request;
pub mod weekly_schedule;

// Re-export specific types to avoid conflicts
pub use agent::{Column as AgentColumn, Entity as Agent, Model as AgentModel};
pub use availability_override::{
    Column as AvailabilityOverrideColumn, Entity as AvailabilityOverride,
    Model as AvailabilityOverrideModel,
};
pub use company_allocation::{
    Column as CompanyAllocationColumn, Entity as CompanyAllocation, Model as CompanyAllocationModel,
};
pub use credit_package::{
    Column as CreditPackageColumn, Entity as CreditPackage, Model as CreditPackageModel,
};
pub use credit_transaction::{
    Column as CreditTransactionColumn, Entity as CreditTransaction, Model as CreditTransactionModel,
};
pub use listing::{Column as ListingColumn, Entity as Listing, Model as ListingModel};
pub use notification::{
    Column as NotificationColumn, Entity as Notification, Model as NotificationModel,
};
pub use order::{Column as OrderColumn, Entity as Order, Model as OrderModel};
pub use order_service::{
    Column as OrderServiceColumn, Entity as OrderService, Model as OrderServiceModel,
};
pub use partner_payout::{
    Column as PartnerPayoutColumn, Entity as PartnerPayout, Model as PartnerPayoutModel,
};
pub use payout_lock::{Column as PayoutLockColumn, Entity as PayoutLock, Model as PayoutLockModel};
pub use staff::{Column as StaffColumn, Entity as Staff, Model as StaffModel};
pub use staff_payout::{
    Column as StaffPayoutColumn, Entity as StaffPayout, Model as StaffPayoutModel,
};
pub use time_off_request::{
    Column as TimeOffRequestColumn, Entity as TimeOffRequest, Model as TimeOffRequestModel,
};
pub use weekly_schedule::{
    Column as WeeklyScheduleColumn, Entity as WeeklySchedule, Model as WeeklyScheduleModel,
};
