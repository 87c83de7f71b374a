pub mod dydx;
