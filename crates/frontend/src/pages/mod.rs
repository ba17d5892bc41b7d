pub mod map_page;
pub mod welcome;
