pub mod cisco;
pub mod fortinet;
pub mod generic;
pub mod mikrotik;
