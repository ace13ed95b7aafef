pub mod shared {
    pub mod constants;
    pub mod error;
    pub mod frame;
    pub mod raw_frame;
    pub mod video_metadata;
}

pub mod video {
    pub mod domain {
        pub mod frame_decoder;
        pub mod frame_reader;
        pub mod frame_source;
    }
    pub mod infrastructure;
}

pub mod comparison {
    pub mod domain {
        pub mod comparison_record;
        pub mod frame_comparator;
        pub mod record_sink;
    }
    pub mod infrastructure;
}

pub mod pipeline {
    pub mod compare_streams_use_case;
    pub mod comparison_logger;
    pub mod comparison_summary;
}
