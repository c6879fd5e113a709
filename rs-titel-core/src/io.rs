use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

/// Reads a whole UTF-8 text file into memory.
pub fn read_text<P: AsRef<Path>>(filename: P) -> io::Result<String> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents)
}

/// Dataset name of a file: its stem, so `data/tkkg_titles.json` is
/// served as `tkkg_titles`.
pub fn get_filename<P: AsRef<Path>>(dataset_path: P) -> io::Result<String> {
	let stem = dataset_path.as_ref().file_stem().ok_or_else(|| {
		io::Error::new(io::ErrorKind::InvalidInput, "dataset path has no file name")
	})?;

	Ok(stem.to_string_lossy().into_owned())
}

/// Turns the configured data directory into the folder datasets are listed
/// from. A bare `.` means the working directory, which is resolved so log
/// lines show where datasets were looked for.
pub fn normalize_folder(data_dir: &str) -> PathBuf {
	let data_dir = data_dir.trim();
	if data_dir == "." || data_dir == "./" {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		PathBuf::from(data_dir)
	}
}

/// Lists all files with a given extension in a directory, sorted by name.
///
/// Returns file names only (no paths).
pub fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();

		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			if let Some(name) = path.file_name() {
				files.push(name.to_string_lossy().to_string());
			}
		}
	}

	files.sort();
	Ok(files)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn filename_drops_folder_and_extension() {
		assert_eq!(get_filename("./data/tkkg_titles.json").unwrap(), "tkkg_titles");
		assert_eq!(get_filename("drei.json").unwrap(), "drei");
	}

	#[test]
	fn data_dir_is_trimmed_and_dot_resolved() {
		assert_eq!(normalize_folder(" ./data "), PathBuf::from("./data"));
		assert_eq!(normalize_folder("."), env::current_dir().unwrap());
	}

	#[test]
	fn list_files_filters_by_extension() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("b.json"), "{}").unwrap();
		fs::write(dir.path().join("a.json"), "{}").unwrap();
		fs::write(dir.path().join("notes.txt"), "").unwrap();
		fs::create_dir(dir.path().join("sub.json")).unwrap();

		let files = list_files(dir.path(), "json").unwrap();
		assert_eq!(files, vec!["a.json".to_owned(), "b.json".to_owned()]);
	}

	#[test]
	fn read_text_reports_missing_file() {
		let dir = tempfile::tempdir().unwrap();
		let err = read_text(dir.path().join("missing.json")).unwrap_err();
		assert_eq!(err.kind(), io::ErrorKind::NotFound);
	}
}
