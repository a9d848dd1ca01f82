pub mod buffer_pool;
pub mod loudness;
pub mod pcm;
