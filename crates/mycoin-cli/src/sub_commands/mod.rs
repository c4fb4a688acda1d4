pub mod balance;
pub mod create;
pub mod explorer;
pub mod history;
pub mod import;
pub mod load;
pub mod logout;
pub mod mining;
pub mod phrase;
pub mod send;
pub mod verify;
