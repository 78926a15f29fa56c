pub mod display_list;
