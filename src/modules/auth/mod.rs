//! Session endpoints under `/api/auth`: login, logout and a protected greeting.

pub mod controller;
pub mod model;
pub mod router;
