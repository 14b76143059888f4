/// Export the two module entry points from an app cdylib.
///
/// `$run` is called on the host's app thread with a [`WindowMessenger`] and
/// should return when the app is done (usually after a quit notification).
///
/// ```ignore
/// fn run(messenger: faisca_bridge::App::WindowMessenger) { /* ... */ }
/// faisca_bridge::app_entry!(run);
/// ```
///
/// [`WindowMessenger`]: crate::App::WindowMessenger
#[macro_export]
macro_rules! app_entry {
    ($run:path) => {
        #[no_mangle]
        pub unsafe extern "C" fn faisca_run_app(
            window: $crate::Protocol::WindowInstance,
            message_window: $crate::ffi::MessageWindowFn,
        ) {
            $run($crate::App::WindowMessenger::new(window, message_window))
        }

        #[no_mangle]
        pub unsafe extern "C" fn faisca_message_app(
            window: $crate::Protocol::WindowInstance,
            message: *const $crate::Protocol::RawAppMessage,
        ) -> u32 {
            $crate::App::handle_app_message(window, message)
        }
    };
}
