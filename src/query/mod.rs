pub mod filter;
pub mod parse;

pub use filter::{
    compile, fold_name, total_pages, CompiledQuery, HotelFilter, HotelQuery, PageWindow, PAGE_SIZE,
};
