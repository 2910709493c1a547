//!
//! Rendering of the generated mocha test file.
//!
//! Every piece of output is a small struct with named fields and a `Display`
//! impl, so data extraction (parser, lookup) never touches text layout.

use std::fmt;

use crate::lookup::LongFieldTable;
use crate::primitives::TestRecord;
use crate::types::ProtocolVersion;

/// Secret key the reference binaries sign with (32 bytes of 42).
pub const SIGNING_SECRET_KEY: [u8; 32] = [42; 32];
/// Link id the reference binaries sign with.
pub const SIGNING_LINK_ID: u8 = 0;
/// Target system used for the simulated SETUP_SIGNING message.
pub const SETUP_SIGNING_TARGET_SYSTEM: u8 = 255;
pub const SETUP_SIGNING_TARGET_COMPONENT: u8 = 0;

/// Separator printed after each test case.
pub const CASE_SEPARATOR: &str = "//------------------------------------------------------";
/// Last line of the generated file.
pub const DONE_MARKER: &str = "//output done";

/// File header; printed once.
pub const PREAMBLE: &str = "
//
// (auto-generated by mavtest-gen), do not edit.
//
// Every test below packs a message with the javascript implementation and
// compares the bytes with what the C implementation produced for the same
// message. Regenerate from this directory with:
//
//     mavtest-gen > made_tests.js
//
// Select tests with mocha's --grep:
//     mocha test --grep 'from C'                      all generated tests
//     mocha test --grep 'using ardupilotmega/1.0'     one message set and version
//     mocha test --grep 'id1234 '                     a single test
//
should = require('should');
";

/// Opening of a `describe` block for one (message set, version) pair.
#[derive(Debug, Clone, Copy)]
pub struct SuiteHeader<'a> {
    pub message_set: &'a str,
    pub version: ProtocolVersion,
}

impl fmt::Display for SuiteHeader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (set, v) = (self.message_set, self.version);
        writeln!(f)?;
        writeln!(f, "//{}", "-".repeat(152))?;
        writeln!(f)?;
        writeln!(f, "describe('end-to-end node byte-level tests of {set}/{v} against C impl', function() {{")?;
        writeln!(f)?;
        writeln!(f, "    beforeEach(function() {{")?;
        writeln!(f, "        return new Promise((beforePromiseResolve) => {{")?;
        writeln!(f, "            let modulePromise = import('../implementations/mavlink_{set}_v{v}/mavlink.js');")?;
        writeln!(f, "            let testsPromise = import('../implementations/mavlink_{set}_v{v}/mavlink.tests.js');")?;
        writeln!(f, "            Promise.all([modulePromise,testsPromise]).then( (values) => {{")?;
        writeln!(f, "                this.mavlink = values[0];")?;
        writeln!(f, "                this.mav = new this.mavlink.MAVLink(null,42,150);")?;
        writeln!(f, "                this.tests = values[1];")?;
        writeln!(f)?;
        writeln!(f, "                // be sure the test library is using the right version before we call into it")?;
        writeln!(f, "                this.tests.set_mav(this.mav);")?;
        writeln!(f)?;
        writeln!(f, "                beforePromiseResolve();")?;
        writeln!(f, "                }});")?;
        writeln!(f, "            }});")?;
        write!(f, "    }});")
    }
}

/// Closing of a `describe` block.
pub struct SuiteFooter;

impl fmt::Display for SuiteFooter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\n\n}});")
    }
}

/// Everything needed to print one `it(...)` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub id: u64,
    pub message_set: String,
    pub version: ProtocolVersion,
    /// Lower-cased message name; the helper object is `test_<name>`.
    pub name: String,
    pub seq: u8,
    pub sysid: u8,
    pub compid: u8,
    /// `Some(timestamp)` when the frame is signed.
    pub signing: Option<u64>,
    /// Timestamp forced right before `pack()`; `0` for unsigned frames.
    pub timestamp: u64,
    /// `test_<name>.<field>=<value>;` lines.
    pub assignments: Vec<String>,
    /// Reference bytes as `0xfd, 0x08, ...`.
    pub reference: String,
}

impl TestCase {
    pub fn from_record(
        id: u64,
        message_set: &str,
        version: ProtocolVersion,
        record: &TestRecord,
        table: &LongFieldTable,
    ) -> TestCase {
        let assignments = record
            .fields
            .iter()
            .map(|a| format!("test_{}.{}={};", record.message, a.name, table.render_value(&record.message, a)))
            .collect();
        TestCase {
            id,
            message_set: message_set.to_string(),
            version,
            name: record.message.clone(),
            seq: record.seq,
            sysid: record.sysid,
            compid: record.compid,
            signing: record.is_signed().then_some(record.timestamp_or_zero()),
            timestamp: record.timestamp_or_zero(),
            assignments,
            reference: record.packet.to_js_list(),
        }
    }

    pub fn is_signed(&self) -> bool {
        self.signing.is_some()
    }

    fn write_opening(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let signed = if self.is_signed() { " signed" } else { "" };
        writeln!(f)?;
        writeln!(
            f,
            "  it('id{} encode and decode {} from C using {}/{}{}', function() {{",
            self.id, self.name, self.message_set, self.version, signed
        )?;
        writeln!(f)?;
        writeln!(f, "        this.mav.seq = {};", self.seq)?;
        writeln!(f, "        this.mav.srcSystem={};", self.sysid)?;
        writeln!(f, "        this.mav.srcComponent={};", self.compid)
    }

    fn write_signing(&self, f: &mut fmt::Formatter<'_>, ts: u64) -> fmt::Result {
        let key = key_list(&SIGNING_SECRET_KEY);
        writeln!(f)?;
        writeln!(f, "        //-------- START codeblock only for signed packets----------------")?;
        writeln!(f)?;
        writeln!(f, "        this.mav.seq = {}-1;", self.seq)?;
        writeln!(f)?;
        writeln!(f, "        this.mav.signing.secret_key = Uint8Array.from([ {key} ]); // matches secret key in testmav.c")?;
        writeln!(f, "        this.mav.signing.link_id = {SIGNING_LINK_ID}; // matches link_id in testmav.c")?;
        writeln!(f, "        this.mav.signing.timestamp = {ts}n; // at most 48 bits, matches timestamp in testmav.c")?;
        writeln!(f, "        this.mav.signing.sign_outgoing = true;")?;
        writeln!(f)?;
        writeln!(f, "        var long_timestamp = {ts}n;")?;
        writeln!(f, "        var target_system = {SETUP_SIGNING_TARGET_SYSTEM};")?;
        writeln!(f, "        var target_component = {SETUP_SIGNING_TARGET_COMPONENT};")?;
        writeln!(f, "        var secret_key = this.mav.signing.secret_key;")?;
        writeln!(f)?;
        writeln!(f, "        this.mav.send = function(mavmsg) {{")?;
        writeln!(f, "            buf = mavmsg.pack(this);")?;
        writeln!(f, "            // no actual send here")?;
        writeln!(f, "            this.seq = (this.seq + 1) % 256;")?;
        writeln!(f, "            this.total_packets_sent +=1;")?;
        writeln!(f, "            this.total_bytes_sent += buf.length;")?;
        writeln!(f, "        }}")?;
        writeln!(f)?;
        writeln!(f, "        var link_id = {SIGNING_LINK_ID};")?;
        writeln!(f, "        var srcSystem = this.mav.srcSystem;")?;
        writeln!(f, "        var srcComponent = this.mav.srcComponent;")?;
        writeln!(f, "        stream_key = new Array(link_id,srcSystem,srcComponent).toString();")?;
        writeln!(f, "        this.mav.signing.stream_timestamps[stream_key] = {ts};")?;
        writeln!(f, "        this.mav.signing.timestamp.should.eql({ts}n); // ts before setup")?;
        writeln!(f)?;
        writeln!(f, "        var setup_signing = new this.mavlink.messages.SETUP_SIGNING(target_system, target_component, secret_key, long_timestamp);")?;
        writeln!(f, "        this.mav.send(setup_signing,this.sysid);")?;
        writeln!(f)?;
        writeln!(f, "        setup_signing.secret_key.should.eql(Uint8Array.from([ {key} ]));")?;
        writeln!(f, "        setup_signing.initial_timestamp.should.eql({ts}n);")?;
        writeln!(f, "        this.mav.signing.timestamp.should.eql({ts}n+1n); // ts after setup")?;
        writeln!(f, "        this.mav.signing.link_id.should.eql({SIGNING_LINK_ID});")?;
        writeln!(f, "        this.mav.signing.sign_outgoing.should.eql(true);")?;
        writeln!(f)?;
        writeln!(f, "        //-------- END codeblock only for signed packets----------------")
    }

    fn write_pack_and_assert(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = &self.name;
        let (signed, unsigned) = if self.is_signed() {
            ("/*signed*/ ", "//unsigned ")
        } else {
            ("//signed ", "/*unsigned*/ ")
        };
        writeln!(f)?;
        writeln!(f, "        var test_{name} = this.tests.test_{name}()[0]; // assembled test object with test data already set")?;
        writeln!(f)?;
        writeln!(f, "//---  uncomment any of these to change the test, the reference buffer must then change to match")?;
        if self.assignments.is_empty() {
            writeln!(f, "//")?;
        }
        for line in &self.assignments {
            writeln!(f, "//      {line}")?;
        }
        writeln!(f, "//---")?;
        writeln!(f)?;
        writeln!(f, "        // bytes the C implementation produced for this message")?;
        writeln!(f, "        var reference = Uint8Array.from([{}]);", self.reference)?;
        writeln!(f)?;
        writeln!(f, "        this.mav.signing.timestamp = {}n; // force ts to be correct, right before the pack() that matters", self.timestamp)?;
        writeln!(f)?;
        writeln!(f, "        var p = test_{name}.pack(this.mav);")?;
        writeln!(f)?;
        writeln!(f, "        test_{name}._header.seq.should.eql({});", self.seq)?;
        writeln!(f, "        test_{name}._header.srcSystem.should.eql({});", self.sysid)?;
        writeln!(f, "        test_{name}._header.srcComponent.should.eql({});", self.compid)?;
        writeln!(f, "        test_{name}._header.msgId.should.eql(test_{name}._id);")?;
        writeln!(f)?;
        writeln!(f, "        {signed}test_{name}._header.incompat_flags.should.eql(1);")?;
        writeln!(f, "        {unsigned}test_{name}._header.incompat_flags.should.eql(0);")?;
        writeln!(f)?;
        writeln!(f, "        test_{name}._header.compat_flags.should.eql(0);")?;
        writeln!(f)?;
        writeln!(f, "        Uint8Array.from(p).should.eql(reference);")?;
        writeln!(f, "    }});")
    }
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_opening(f)?;
        if let Some(ts) = self.signing {
            self.write_signing(f, ts)?;
        }
        self.write_pack_and_assert(f)?;
        write!(f, "{CASE_SEPARATOR}")
    }
}

fn key_list(key: &[u8]) -> String {
    key.iter().map(|b| b.to_string()).collect::<Vec<_>>().join(", ")
}

pub fn render_test_case(case: &TestCase) -> String {
    case.to_string()
}
