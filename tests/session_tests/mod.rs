pub mod editing_test;
