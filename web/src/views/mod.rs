pub mod pub_map;
