/// Distancia de Levenshtein entre dos secuencias de caracteres.
///
/// Inserción, borrado y sustitución cuestan 1. Programación dinámica clásica
/// con dos filas, O(n·m) en tiempo y O(m) en memoria.
pub fn levenshtein(a: &[char], b: &[char]) -> usize {
  if a.is_empty() {
    return b.len();
  }
  if b.is_empty() {
    return a.len();
  }

  let mut prev: Vec<usize> = (0..=b.len()).collect();
  let mut curr = vec![0usize; b.len() + 1];

  for (i, ca) in a.iter().enumerate() {
    curr[0] = i + 1;
    for (j, cb) in b.iter().enumerate() {
      curr[j + 1] = if ca == cb {
        prev[j]
      } else {
        1 + prev[j].min(prev[j + 1]).min(curr[j])
      };
    }
    std::mem::swap(&mut prev, &mut curr);
  }

  prev[b.len()]
}

/// Similitud normalizada en `[0, 1]`, sin distinguir mayúsculas.
///
/// `1 - d(a, b) / max(|a|, |b|)`; dos cadenas vacías valen `1`. Las
/// longitudes son las de las entradas tal cual, antes de pasar a minúsculas.
pub fn similarity(a: &str, b: &str) -> f64 {
  let max_len = a.chars().count().max(b.chars().count());

  let a: Vec<char> = a.chars().flat_map(char::to_lowercase).collect();
  let b: Vec<char> = b.chars().flat_map(char::to_lowercase).collect();

  if max_len == 0 {
    return 1.0;
  }

  let distance = levenshtein(&a, &b);
  (1.0 - distance as f64 / max_len as f64).max(0.0)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
  }

  #[test]
  fn levenshtein_classic_cases() {
    assert_eq!(levenshtein(&chars("kitten"), &chars("sitting")), 3);
    assert_eq!(levenshtein(&chars(""), &chars("abc")), 3);
    assert_eq!(levenshtein(&chars("flaw"), &chars("lawn")), 2);
  }

  #[test]
  fn similarity_bounds() {
    assert_eq!(similarity("", ""), 1.0);
    assert_eq!(similarity("abc", "abc"), 1.0);
    let s = similarity("abc", "xyz");
    assert!((0.0..0.4).contains(&s), "got {s}");
  }

  #[test]
  fn similarity_is_case_insensitive() {
    assert_eq!(similarity("JOLENE", "jolene"), 1.0);
  }

  #[test]
  fn similarity_counts_characters_not_bytes() {
    // "José" y "Jose" difieren en un carácter de cuatro.
    assert!((similarity("José", "Jose") - 0.75).abs() < 1e-9);
  }

  #[test]
  fn similarity_uses_lengths_before_lowercasing() {
    // 'İ' pasa a dos caracteres en minúscula ("i̇"); la longitud sigue siendo 1.
    assert_eq!(similarity("İ", "i"), 0.0);
  }

  #[test]
  fn similarity_against_empty_is_zero() {
    assert_eq!(similarity("abc", ""), 0.0);
  }
}
