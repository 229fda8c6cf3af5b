// ==========================================
// Internacionalização (i18n)
// ==========================================
// Usa a biblioteca rust-i18n
// Suporta português (padrão) e inglês
// ==========================================
// Observação: a macro rust_i18n::i18n! é inicializada em lib.rs
// ==========================================

/// Idiomas suportados
pub const SUPPORTED_LOCALES: [&str; 2] = ["pt-BR", "en"];

/// Idioma padrão
pub const DEFAULT_LOCALE: &str = "pt-BR";

/// Idioma atual
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// Define o idioma
///
/// Idioma desconhecido cai no padrão (pt-BR).
pub fn set_locale(locale: &str) {
    if SUPPORTED_LOCALES.contains(&locale) {
        rust_i18n::set_locale(locale);
    } else {
        tracing::warn!(locale, "idioma não suportado, usando {}", DEFAULT_LOCALE);
        rust_i18n::set_locale(DEFAULT_LOCALE);
    }
}

/// Traduz uma mensagem (sem parâmetros)
///
/// # Exemplo
/// ```no_run
/// use orcamento_obras::i18n::t;
/// let msg = t("viability.bom");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// Traduz uma mensagem com parâmetros `%{nome}`
///
/// # Exemplo
/// ```no_run
/// use orcamento_obras::i18n::t_with_args;
/// let msg = t_with_args("validation.name_required", &[("field", "compositions[0].name")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}
