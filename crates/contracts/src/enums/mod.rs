pub mod region_code;
