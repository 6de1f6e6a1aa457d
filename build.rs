// Build script to compile Protocol Buffer definitions for the gRPC transport.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tonic_build::compile_protos("proto/room.proto")?;

    println!("cargo:rerun-if-changed=proto/room.proto");

    Ok(())
}
