pub mod type_inference_test;
