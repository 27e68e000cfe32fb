pub mod tyl;
