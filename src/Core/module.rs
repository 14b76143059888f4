// Dynamic app module loader (dlopen/dlsym).
//
// The module must export the two entry points named in `ffi`. They are
// resolved once here; everything afterwards goes through the `EntryTable`.

use crate::ffi::{EntryTable, MessageAppFn, RunAppFn, MESSAGE_APP_SYMBOL, RUN_APP_SYMBOL};
use crate::Host::HostError;
use std::ffi::{c_void, CStr};
use std::path::{Path, PathBuf};
use std::ptr::NonNull;

/// A loaded app module. Unloaded on drop, so it must outlive the app thread.
pub struct AppModule {
    handle: NonNull<c_void>,
    path: PathBuf,
    entries: EntryTable,
}

// The handle is only used to unload; symbols are plain function pointers.
unsafe impl Send for AppModule {}

impl AppModule {
    #[cfg(unix)]
    pub fn load(path: &Path) -> Result<Self, HostError> {
        use std::os::unix::ffi::OsStrExt;

        let c_path = std::ffi::CString::new(path.as_os_str().as_bytes()).map_err(|_| {
            HostError::ModuleLoad {
                path: path.to_path_buf(),
                reason: "path contains a nul byte".to_string(),
            }
        })?;

        let handle = unsafe { libc::dlopen(c_path.as_ptr(), libc::RTLD_NOW | libc::RTLD_LOCAL) };
        let handle = NonNull::new(handle).ok_or_else(|| HostError::ModuleLoad {
            path: path.to_path_buf(),
            reason: last_dl_error(),
        })?;

        let resolved = resolve(handle, path, RUN_APP_SYMBOL)
            .and_then(|run_app| Ok((run_app, resolve(handle, path, MESSAGE_APP_SYMBOL)?)));
        let (run_app, message_app) = match resolved {
            Ok(symbols) => symbols,
            Err(e) => {
                unsafe { libc::dlclose(handle.as_ptr()) };
                return Err(e);
            }
        };

        // SAFETY: the entry point contract fixes both signatures.
        let entries = unsafe {
            EntryTable::new(
                std::mem::transmute::<NonNull<c_void>, RunAppFn>(run_app),
                std::mem::transmute::<NonNull<c_void>, MessageAppFn>(message_app),
            )
        };
        let module = Self {
            handle,
            path: path.to_path_buf(),
            entries,
        };

        log::info!("loaded app module {}", module.path.display());
        Ok(module)
    }

    #[cfg(not(unix))]
    pub fn load(path: &Path) -> Result<Self, HostError> {
        Err(HostError::ModuleLoad {
            path: path.to_path_buf(),
            reason: "dynamic app modules are only supported on unix targets".to_string(),
        })
    }

    pub fn entries(&self) -> EntryTable {
        self.entries
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for AppModule {
    fn drop(&mut self) {
        #[cfg(unix)]
        unsafe {
            libc::dlclose(self.handle.as_ptr());
        }
        log::debug!("unloaded app module {}", self.path.display());
    }
}

#[cfg(unix)]
fn resolve(handle: NonNull<c_void>, path: &Path, symbol: &CStr) -> Result<NonNull<c_void>, HostError> {
    let address = unsafe { libc::dlsym(handle.as_ptr(), symbol.as_ptr()) };
    NonNull::new(address).ok_or_else(|| HostError::MissingSymbol {
        symbol: symbol.to_string_lossy().into_owned(),
        path: path.to_path_buf(),
    })
}

#[cfg(unix)]
fn last_dl_error() -> String {
    let message = unsafe { libc::dlerror() };
    if message.is_null() {
        "unknown dynamic loader error".to_string()
    } else {
        unsafe { CStr::from_ptr(message) }.to_string_lossy().into_owned()
    }
}
