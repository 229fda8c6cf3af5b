// ==========================================
// Gestão de Obras - Aritmética monetária verificada
// ==========================================
// Toda conta dos motores passa por aqui: estouro da faixa do
// Decimal vira violação AMOUNT_OUT_OF_RANGE no campo derivado
// (prefixo + nome), nunca um total inválido
// ==========================================

use crate::engine::validation::{join, out_of_range, ValidationError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub(crate) type AmountResult = Result<Decimal, ValidationError>;

const ONE_HUNDRED: Decimal = dec!(100);

fn overflow(prefix: &str, name: &str) -> ValidationError {
    out_of_range(join(prefix, name))
}

pub(crate) fn add(a: Decimal, b: Decimal, prefix: &str, name: &str) -> AmountResult {
    a.checked_add(b).ok_or_else(|| overflow(prefix, name))
}

pub(crate) fn sub(a: Decimal, b: Decimal, prefix: &str, name: &str) -> AmountResult {
    a.checked_sub(b).ok_or_else(|| overflow(prefix, name))
}

pub(crate) fn mul(a: Decimal, b: Decimal, prefix: &str, name: &str) -> AmountResult {
    a.checked_mul(b).ok_or_else(|| overflow(prefix, name))
}

/// value × percent / 100
pub(crate) fn percent_of(value: Decimal, percent: Decimal, prefix: &str, name: &str) -> AmountResult {
    let rate = percent
        .checked_div(ONE_HUNDRED)
        .ok_or_else(|| overflow(prefix, name))?;
    mul(value, rate, prefix, name)
}

/// part / whole × 100 (0 quando whole <= 0)
pub(crate) fn share(part: Decimal, whole: Decimal, prefix: &str, name: &str) -> AmountResult {
    if whole <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    let ratio = part.checked_div(whole).ok_or_else(|| overflow(prefix, name))?;
    mul(ratio, ONE_HUNDRED, prefix, name)
}
