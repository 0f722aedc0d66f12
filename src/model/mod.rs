pub mod budget;
pub mod directory;
pub mod employee;
pub mod payroll;
pub mod role;
pub mod scenario;
pub mod tax_rate;
pub mod user;
