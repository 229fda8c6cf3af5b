// Utilitários compartilhados pelos testes de integração
#![allow(dead_code)]

pub mod test_data_builder;
