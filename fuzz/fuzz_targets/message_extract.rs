#![no_main]

use bitstream::{BitBuffer, BitWriter};
use libfuzzer_sys::fuzz_target;
use messages::{client_message_factory, server_message_factory, MAX_MESSAGE_BYTES};

fuzz_target!(|data: &[u8]| {
    let (Ok(client), Ok(server)) = (client_message_factory(), server_message_factory()) else {
        return;
    };

    for factory in [&client, &server] {
        let Ok(extracted) = factory.extract_bytes(data) else {
            continue;
        };

        // Anything that decodes must re-encode to a message that decodes equal.
        let mut buffer = BitBuffer::new(MAX_MESSAGE_BYTES);
        if extracted.message.serialize(&mut BitWriter::new(&mut buffer)).is_err() {
            continue;
        }
        let again = factory
            .extract_bytes(buffer.as_bytes())
            .expect("re-encoded message must decode");
        assert!(*again.message == *extracted.message);
    }
});
