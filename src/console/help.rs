pub const HELP_TEXT: &str = "\
commands (shortest unambiguous prefix is accepted):
  continue                         resume the inferior
  break 0x<hex>                    set a breakpoint at a runtime address
  break <file>:<line>              set a breakpoint at a source line
  break <name>                     set a breakpoint at a function
  step                             step one source line, into calls
  next                             step one source line, over calls
  finish                           run until the current function returns
  register dump                    print all registers
  register read <name>             print one register
  register write <name> 0x<hex>    set a register
  memory read 0x<hex>              print one word of inferior memory
  memory write 0x<hex> 0x<hex>     set one word of inferior memory
  symbol <name>                    print every matching symbol
  show                             print the current function's source
  help                             print this text
";
