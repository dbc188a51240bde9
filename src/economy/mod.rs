pub mod building;
pub mod construction;
pub mod ledger;
pub mod production;
pub mod raid;
pub mod technology;
pub mod trade;
