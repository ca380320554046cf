pub mod corroboration;
pub mod record;
pub mod threshold;
pub mod vector;
