pub mod sentence;

pub use sentence::{
    checksum, encode, encode_sentence, to_hex, PflaaFields, TrafficSentence, ID_WIDTH,
    SENTENCE_TAG,
};
