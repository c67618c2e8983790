//! Validación de CPF
//!
//! Algoritmo oficial de dígitos verificadores del CPF brasileño.
//! Funciones puras, sin I/O ni estado.

/// Elimina todo carácter que no sea dígito ASCII.
pub fn normalize_cpf(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Calcula los dos dígitos verificadores a partir de los 9 dígitos base.
pub fn check_digits(base: &[u8; 9]) -> (u8, u8) {
    let first = verifier_digit(base, 10);

    let mut extended = [0u8; 10];
    extended[..9].copy_from_slice(base);
    extended[9] = first;
    let second = verifier_digit(&extended, 11);

    (first, second)
}

fn verifier_digit(digits: &[u8], initial_factor: u32) -> u8 {
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| u32::from(*d) * (initial_factor - i as u32))
        .sum();

    let remainder = sum % 11;
    if remainder < 2 {
        0
    } else {
        (11 - remainder) as u8
    }
}

/// Valida un CPF. Acepta puntuación (`529.982.247-25`).
///
/// Nunca falla: devuelve `false` para cualquier entrada mal formada,
/// incluidos los 11 dígitos repetidos que el algoritmo aceptaría.
pub fn is_valid_cpf(value: &str) -> bool {
    let digits: Vec<u8> = value
        .chars()
        .filter_map(|c| c.to_digit(10))
        .map(|d| d as u8)
        .collect();

    if digits.len() != 11 {
        return false;
    }

    if digits.iter().all(|d| *d == digits[0]) {
        return false;
    }

    let mut base = [0u8; 9];
    base.copy_from_slice(&digits[..9]);
    let (first, second) = check_digits(&base);

    digits[9] == first && digits[10] == second
}

/// Formatea 11 dígitos como `XXX.XXX.XXX-XX`. Cualquier otra entrada se
/// devuelve normalizada sin formato.
pub fn format_cpf(value: &str) -> String {
    let digits = normalize_cpf(value);
    if digits.len() != 11 {
        return digits;
    }
    format!(
        "{}.{}.{}-{}",
        &digits[0..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..11]
    )
}
