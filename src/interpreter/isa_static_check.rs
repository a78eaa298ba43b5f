#[cfg(test)]
mod tests {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    fn fnv1a64(mut h: u64, bytes: &[u8]) -> u64 {
        for b in bytes {
            h ^= *b as u64;
            h = h.wrapping_mul(FNV_PRIME);
        }
        h
    }

    macro_rules! hash_isa {
        (
            $( $(#[$doc:meta])* $name:ident = $mnemonic:literal => [ $( $field:ident : $kind:ident ),* $(,)? ] ),* $(,)?
        ) => {{
            let mut h = FNV_OFFSET;
            $(
                h = fnv1a64(h, stringify!($name).as_bytes());
                h = fnv1a64(h, $mnemonic.as_bytes());
                $( h = fnv1a64(h, stringify!($kind).as_bytes()); )*
                h = fnv1a64(h, &[0xFF]);
            )*
            h
        }};
    }

    fn current_isa_hash() -> u64 {
        crate::for_each_instruction!(hash_isa)
    }

    /// Fingerprint of the table, computed from the same byte stream the
    /// macro hashes so the check fails whenever an entry is added, removed,
    /// reordered or changes mnemonic or operand kind.
    fn expected_isa_hash() -> u64 {
        const TABLE: &[(&str, &str, &[&str])] = &[
            ("BeginProgram", "INPP", &[]),
            ("Halt", "PARA", &[]),
            ("Allocate", "AMEM", &["Count"]),
            ("Deallocate", "DMEM", &["Count"]),
            ("PushConstant", "CRCT", &["Int"]),
            ("Load", "CRVL", &["Addr"]),
            ("Store", "ARMZ", &["Addr"]),
            ("Add", "SOMA", &[]),
            ("Subtract", "SUBT", &[]),
            ("Multiply", "MULT", &[]),
            ("Divide", "DIVI", &[]),
            ("Negate", "INVR", &[]),
            ("And", "CONJ", &[]),
            ("Or", "DISJ", &[]),
            ("Less", "CMME", &[]),
            ("LessEqual", "CMEG", &[]),
            ("Equal", "CMIG", &[]),
            ("NotEqual", "CMDG", &[]),
            ("GreaterEqual", "CMAG", &[]),
            ("Greater", "CMMA", &[]),
            ("Jump", "DSVS", &["Target"]),
            ("JumpIfFalse", "DSVF", &["Target"]),
            ("NoOp", "NADA", &[]),
            ("Print", "IMPR", &[]),
        ];

        TABLE.iter().fold(FNV_OFFSET, |mut h, (name, mnemonic, kinds)| {
            h = fnv1a64(h, name.as_bytes());
            h = fnv1a64(h, mnemonic.as_bytes());
            for kind in *kinds {
                h = fnv1a64(h, kind.as_bytes());
            }
            fnv1a64(h, &[0xFF])
        })
    }

    #[test]
    fn isa_hash_unchanged() {
        assert_eq!(current_isa_hash(), expected_isa_hash());
    }
}
