use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Result, bail};
use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};

use crate::config::Config;
use crate::store::schema::{EXPORT_VERSION, ExportData, LibraryData, TimingData};

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cubedex");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
                Err(_) => T::default(),
            }
        } else {
            T::default()
        }
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Load the algorithm library, seeding the starter set on first
    /// launch and resetting on a schema mismatch. Returned entries have
    /// their move sequences re-parsed and ready to drill.
    pub fn load_library(&self) -> LibraryData {
        if !self.file_path("library.json").exists() {
            return LibraryData::starter();
        }
        let mut library: LibraryData = self.load("library.json");
        if library.needs_reset() {
            return LibraryData::starter();
        }
        library.rehydrate();
        library
    }

    pub fn save_library(&self, data: &LibraryData) -> Result<()> {
        self.save("library.json", data)
    }

    pub fn load_timing(&self) -> TimingData {
        let timing: TimingData = self.load("timing.json");
        if timing.needs_reset() {
            TimingData::default()
        } else {
            timing
        }
    }

    pub fn save_timing(&self, data: &TimingData) -> Result<()> {
        self.save("timing.json", data)
    }

    pub fn export_all(&self, config: &Config) -> ExportData {
        ExportData {
            cubedex_export_version: EXPORT_VERSION,
            exported_at: Utc::now(),
            config: config.clone(),
            library: self.load_library(),
            timing: self.load_timing(),
        }
    }

    /// Transactional import: stage everything to .tmp files, then commit
    /// with best-effort .bak rollback so a failure midway never leaves a
    /// half-imported store.
    pub fn import_all(&self, data: &ExportData) -> Result<()> {
        if data.cubedex_export_version != EXPORT_VERSION {
            bail!(
                "Unsupported export version: {} (expected {})",
                data.cubedex_export_version,
                EXPORT_VERSION
            );
        }

        let files: Vec<(&str, String)> = vec![
            ("library.json", serde_json::to_string_pretty(&data.library)?),
            ("timing.json", serde_json::to_string_pretty(&data.timing)?),
        ];

        let mut staged: Vec<PathBuf> = Vec::new();
        for (name, json) in &files {
            let tmp_path = self.file_path(name).with_extension("json.tmp");
            match (|| -> Result<()> {
                let mut file = fs::File::create(&tmp_path)?;
                file.write_all(json.as_bytes())?;
                file.sync_all()?;
                Ok(())
            })() {
                Ok(()) => staged.push(tmp_path),
                Err(e) => {
                    for tmp in &staged {
                        let _ = fs::remove_file(tmp);
                    }
                    bail!("Import failed during staging: {e}");
                }
            }
        }

        // Commit phase: back up originals, then move staged files in.
        let mut committed: Vec<(PathBuf, PathBuf, bool)> = Vec::new();
        for (i, (name, _)) in files.iter().enumerate() {
            let final_path = self.file_path(name);
            let bak_path = self.file_path(name).with_extension("json.bak");
            let tmp_path = &staged[i];
            let had_original = final_path.exists();

            if had_original && let Err(e) = fs::rename(&final_path, &bak_path) {
                for (committed_final, committed_bak, committed_had) in &committed {
                    if *committed_had {
                        let _ = fs::rename(committed_bak, committed_final);
                    } else {
                        let _ = fs::remove_file(committed_final);
                    }
                }
                for tmp in &staged {
                    let _ = fs::remove_file(tmp);
                }
                bail!("Import failed during commit (backup): {e}");
            }

            if let Err(e) = fs::rename(tmp_path, &final_path) {
                if had_original && bak_path.exists() {
                    let _ = fs::rename(&bak_path, &final_path);
                } else {
                    let _ = fs::remove_file(&final_path);
                }
                for (committed_final, committed_bak, committed_had) in &committed {
                    if *committed_had {
                        let _ = fs::rename(committed_bak, committed_final);
                    } else {
                        let _ = fs::remove_file(committed_final);
                    }
                }
                for tmp in &staged[i + 1..] {
                    let _ = fs::remove_file(tmp);
                }
                bail!("Import failed during commit (rename): {e}");
            }

            committed.push((final_path, bak_path, had_original));
        }

        for (_, bak_path, had_original) in &committed {
            if *had_original {
                let _ = fs::remove_file(bak_path);
            }
        }

        Ok(())
    }

    /// Clean up .bak files left over from an interrupted import.
    pub fn check_interrupted_import(&self) -> bool {
        let bak_names = ["library.json.bak", "timing.json.bak"];
        let mut found = false;
        for name in &bak_names {
            let bak_path = self.base_dir.join(name);
            if bak_path.exists() {
                found = true;
                let _ = fs::remove_file(&bak_path);
            }
        }
        found
    }
}
