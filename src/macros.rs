/**
 A helper macro to access fields of a `libc::dirent`/`libc::dirent64` aka
 'dirent-type' struct by pointer, papering over the platforms where a field
 is missing or aliased.

 # Safety
 - The caller must ensure that the pointer is valid and points to a
   'dirent-type' struct.
*/
macro_rules! access_dirent {
    ($entry_ptr:expr, d_reclen) => {{
        // SAFETY: Caller must ensure pointer is valid
        (*$entry_ptr).d_reclen as usize
    }};
    ($entry_ptr:expr, d_name) => {{
        // Take a raw pointer rather than reading by value, the name is not
        // guaranteed to actually be [c_char; 256] (variable length array)
        (&raw const (*$entry_ptr).d_name).cast::<_>()
    }};
    ($entry_ptr:expr, d_type) => {{
        #[cfg(any(
            target_os = "solaris",
            target_os = "illumos",
            target_os = "aix",
            target_os = "nto",
            target_os = "haiku",
        ))]
        {
            // these dirents carry no type hint at all, report unknown and let
            // the classifier stat its way out
            libc::DT_UNKNOWN
        }
        #[cfg(not(any(
            target_os = "solaris",
            target_os = "illumos",
            target_os = "aix",
            target_os = "nto",
            target_os = "haiku",
        )))]
        {
            (*$entry_ptr).d_type
        }
    }};
}

///A macro to safely access stat entries in a filesystem independent way
macro_rules! access_stat {
    ($stat_struct:expr, st_mtimensec) => {{
        #[cfg(target_os = "netbsd")]
        {
            $stat_struct.st_mtimensec as _
        } //why did they do such a specific change

        #[cfg(not(target_os = "netbsd"))]
        {
            $stat_struct.st_mtime_nsec as _
        }
    }};

    ($stat_struct:expr, st_atimensec) => {{
        #[cfg(target_os = "netbsd")]
        {
            $stat_struct.st_atimensec as _
        }

        #[cfg(not(target_os = "netbsd"))]
        {
            $stat_struct.st_atime_nsec as _
        }
    }};

    // inode number, normalised to u64 for compatibility
    ($stat_struct:expr, st_ino) => {{
        #[cfg(any(
            target_os = "freebsd",
            target_os = "openbsd",
            target_os = "netbsd",
            target_os = "dragonfly"
        ))]
        {
            $stat_struct.st_ino as u64
        }

        #[cfg(not(any(
            target_os = "freebsd",
            target_os = "openbsd",
            target_os = "netbsd",
            target_os = "dragonfly"
        )))]
        {
            $stat_struct.st_ino
        }
    }};

    // Fallback for other fields
    ($stat_struct:expr, $field:ident) => {{ $stat_struct.$field as _ }};
}

/// Extremely simple macro for getting rid of boiler plates
macro_rules! return_os_error {
    () => {{
        return Err(std::io::Error::last_os_error());
    }};
}

/// Macro for safely calling stat-like functions and handling the result
macro_rules! stat_syscall {
    // For fstatat with flags
    ($syscall:ident, $fd:expr, $path:expr, $flags:expr) => {{
        let mut stat_buf = core::mem::MaybeUninit::<libc::stat>::uninit();
        // SAFETY:
        // - The path is guaranteed to be null-terminated (CStr)
        let res = unsafe { $syscall($fd, $path, stat_buf.as_mut_ptr(), $flags) };

        if res == 0 {
            // SAFETY: If the return code is 0, we know the stat structure has been properly initialised
            Ok(unsafe { stat_buf.assume_init() })
        } else {
            Err(std::io::Error::last_os_error())
        }
    }};

    // For stat/lstat with path pointer
    ($syscall:ident, $path_ptr:expr) => {{
        let mut stat_buf = core::mem::MaybeUninit::<libc::stat>::uninit();
        // SAFETY: We know the path is valid because internally it's a cstr
        let res = unsafe { $syscall($path_ptr, stat_buf.as_mut_ptr()) };

        if res == 0 {
            // SAFETY: If the return code is 0, we know it's been initialised properly
            Ok(unsafe { stat_buf.assume_init() })
        } else {
            Err(std::io::Error::last_os_error())
        }
    }};
}

/**
 Macro to create a const from an env var with compile-time parsing.

 Uses `option_env` under the hood, so it can catch rustc build environment
 variables. The value must contain only numeric characters; anything else
 fails the build on purpose.
*/
macro_rules! const_from_env {
    ($(#[$meta:meta])* $name:ident: $t:ty = $env:expr, $default:expr) => {
        $(#[$meta])*
        pub const $name: $t = {
            // A helper const function to parse a string into a number.
            // This is used only when an environment variable is found.
            #[allow(clippy::single_call_fn)]
            #[allow(clippy::indexing_slicing)] //this will panic at compile time, intentionally.
            const fn parse_env(s: &str) -> $t {
                let mut n: $t = 0;
                let s_bytes = s.as_bytes();
                let mut i = 0;

                while i < s_bytes.len() {
                    let b = s_bytes[i];
                    match b {
                        b'0'..=b'9' => {
                            n = n * 10 + (b - b'0') as $t;
                        }
                        _ => panic!(concat!("Invalid numeric value in environment variable: ", stringify!($env))),
                    }
                    i += 1;
                }
                n
            }

            // Check if the environment variable is set.
            match option_env!($env) {
                // If it's set, parse the string value.
                Some(val) => parse_env(val),
                // If not, use the default
                None => $default as _,
            }
        };
    };
}
