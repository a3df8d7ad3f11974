pub mod druginfo;
