//! Load cell ADC drivers

pub mod hx711;

#[cfg(test)]
pub(crate) mod sim;
