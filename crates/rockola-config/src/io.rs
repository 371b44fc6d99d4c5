use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Escribe `contents` en `path` sin dejar nunca un fichero a medias.
///
/// Se escribe a `<path>.tmp`, se hace `fsync` y se renombra encima del
/// destino; el rename es atómico dentro del mismo sistema de ficheros.
pub fn atomic_write_str(path: &Path, contents: &str) -> io::Result<()> {
  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    fs::create_dir_all(parent)?;
  }

  let tmp_path = path.with_extension("tmp");
  {
    let mut tmp = fs::File::create(&tmp_path)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.sync_all()?;
  }

  fs::rename(&tmp_path, path)
}
