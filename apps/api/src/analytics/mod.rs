// Usage analytics: Event Store writes, reporting queries, and their routes.

pub mod events;
pub mod handlers;
pub mod reports;
