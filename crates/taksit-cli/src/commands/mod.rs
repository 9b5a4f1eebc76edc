pub mod amortization;
pub mod numeric;
