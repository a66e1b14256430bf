pub mod decode;
pub mod pcm;
