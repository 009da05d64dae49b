// This file is required to make `cargo test` discover tests in subdirectories.

#[cfg(test)]
mod common;

#[cfg(test)]
mod bridge;


#[cfg(test)]
mod docx;

#[cfg(test)]
mod pdf;
