#![no_main]

use libfuzzer_sys::fuzz_target;
use vela_cli::{InvocationOptions, InvocationSpec};
use vela_startup::{route, Route, RouteError};

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);
    let mut parts = raw.split('\0');
    let flags = parts.next().unwrap_or_default().as_bytes();
    let params = parts.next().map(str::to_string);
    let positionals = parts.map(str::to_string).collect::<Vec<_>>();
    let flag = |bit: usize| flags.get(bit).is_some_and(|byte| byte & 1 == 1);

    let options = InvocationOptions {
        params,
        print: flag(0),
        lite: flag(1),
        max: flag(2),
        experimental: flag(3),
        ask: flag(4),
        pro: flag(5),
        ..InvocationOptions::default()
    };
    match route(&InvocationSpec::new(positionals, options)) {
        Ok(Route::Session(session)) => {
            if let Some(params) = &session.agent_params {
                assert!(params.is_object());
            }
            if session.print {
                assert!(session.initial_input.is_some() || session.agent_params.is_some());
            }
        }
        Ok(_) => {}
        Err(RouteError::EmptyTemplate) => panic!("no template was supplied"),
        Err(_) => {}
    }
});
