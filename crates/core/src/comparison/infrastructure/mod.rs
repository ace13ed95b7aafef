pub mod json_lines_record_sink;
pub mod ssim_comparator;
pub mod text_record_sink;
