pub mod profiler_view;
pub mod settings;
