//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in heft-core for converter hardware:
//!
//! - Load cell ADCs (HX711 24-bit bridge converter)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod adc;

pub use adc::hx711::Hx711;
