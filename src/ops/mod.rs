pub mod agenda;
pub mod filter;
pub mod identity;
pub mod item_ops;
pub mod recurrence;
pub mod reminders;
pub mod repository;
