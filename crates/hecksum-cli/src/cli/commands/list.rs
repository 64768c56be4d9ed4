//! `hecksum list` – registered extractor names.

use hecksum_core::extract;

pub fn run_list() {
    for extractor in extract::registry() {
        println!("{}", extractor.name());
    }
}
