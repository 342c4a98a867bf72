pub mod email_address;
pub mod proof_code;
pub mod proof_item;
