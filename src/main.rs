#![allow(non_snake_case)]
use RustedAlgebra::Examples::equation_examples::equation_examples;
use RustedAlgebra::Utils::logger::init_logger;
use log::error;

fn main() {
    let example = 1;
    if let Err(e) = init_logger(Some("info"), None) {
        eprintln!("{}", e);
        return;
    }
    if let Err(e) = equation_examples(example) {
        error!("example {} failed: {}", example, e);
    }
}
