/// Entity round trips and relation loading against in-memory SQLite
pub mod entity_tests;
