pub mod status;
pub mod upgrade;
