pub mod lookup;
pub mod product;
