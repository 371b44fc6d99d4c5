//! Identificadores derivados de título + artista.
//!
//! Son deterministas: la misma canción produce siempre el mismo id, entre
//! llamadas y entre procesos.

/// Pasa a minúsculas y sustituye cada tramo de espacios en blanco por `-`.
///
/// `"Take Me  Home"` → `"take-me-home"`. Los extremos no se recortan, igual
/// que los datos del catálogo, que ya vienen limpios.
pub fn slug(value: &str) -> String {
  let mut out = String::with_capacity(value.len());
  let mut in_whitespace = false;

  for ch in value.chars() {
    if ch.is_whitespace() {
      if !in_whitespace {
        out.push('-');
      }
      in_whitespace = true;
    } else {
      out.extend(ch.to_lowercase());
      in_whitespace = false;
    }
  }

  out
}

/// Id de un candidato que sale del catálogo curado.
pub fn curated_candidate_id(title: &str, artist: &str) -> String {
  format!("curated-{}-{}", slug(title), slug(artist))
}

/// Id de canción que viaja en la petición al sistema del local (`"artista-título"`).
pub fn request_song_id(title: &str, artist: &str) -> String {
  format!("{}-{}", slug(artist), slug(title))
}
