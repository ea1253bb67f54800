// Text encoding — stemmed tokenization and binary bag-of-words vectors.

pub mod tokenizer;
pub mod vectorizer;
