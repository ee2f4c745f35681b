mod email_tests;
