#![cfg(test)]
mod scan;
mod trace;
mod utils;
