//! different utility modules used throughout the project
/// result sinks (txt, csv, memory) and logger setup
pub mod logger;
/// parse task documents with structure like " title1 key1: value1, value2 key2: value2 title2 key3:value3, value4" into a TaskConfig
pub mod task_parser;
