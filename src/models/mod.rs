pub mod availability;
pub mod kv_entries;
pub mod motos;
pub mod reservations;
pub mod services;
